// import modules
mod employee;
mod report;

// export modules
pub use employee::*;
pub use report::*;
