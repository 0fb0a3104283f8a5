pub mod cli;
pub mod domain;
pub mod infra;
mod run;
pub mod traits;

pub use self::{
    domain::Error,
    run::{run, start},
};
