pub mod decode;
pub mod pixbuf;
