pub mod fog;
