pub mod consts;
pub mod error;
pub mod frame;
pub mod io;
pub mod store;
pub mod diff;
pub mod view;
pub mod session;
