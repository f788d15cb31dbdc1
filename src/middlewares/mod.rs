pub mod session_guard;
