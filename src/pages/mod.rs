pub mod app_page;
pub mod home;
pub mod init_page;
pub mod loading;
pub mod not_found;
pub mod not_ready;
