pub mod install;

pub use install::handle_install;
