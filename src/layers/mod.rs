pub(crate) mod attr;
pub(crate) mod model;
pub(crate) mod stack;
