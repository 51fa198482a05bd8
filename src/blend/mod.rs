pub(crate) mod algorithms;
