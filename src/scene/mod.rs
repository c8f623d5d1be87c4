pub(crate) mod composite;
pub(crate) mod cutout;
pub(crate) mod debounce;
pub(crate) mod doc;
pub(crate) mod events;
pub(crate) mod session;
