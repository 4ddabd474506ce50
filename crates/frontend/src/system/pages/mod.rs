pub mod login;
pub mod recover_password;
