mod clerk;
mod remote;
mod stripe;

pub use clerk::*;
pub use remote::*;
pub use stripe::*;
