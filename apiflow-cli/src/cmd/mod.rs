pub mod cancel;
pub mod cleanup;
pub mod config;
pub mod migrate;
pub mod recent;
pub mod run;
pub mod status;
pub mod validate;
pub mod worker;
