mod login;
mod logout;
mod whoami;

pub use login::login;
pub use logout::logout;
pub use whoami::whoami;
