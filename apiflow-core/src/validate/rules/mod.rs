pub(crate) mod conditions;
pub(crate) mod request;
pub(crate) mod step;
pub(crate) mod transformations;
