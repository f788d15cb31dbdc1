pub mod html;
pub mod qr;
pub mod session;
pub mod short_code;
pub mod url_check;
