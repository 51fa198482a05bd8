pub(crate) mod compositor;
pub(crate) mod strips;
