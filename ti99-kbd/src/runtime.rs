#[cfg(feature = "irq")]
pub(crate) mod irq;
#[cfg(feature = "poll")]
pub(crate) mod poll;
pub(crate) mod shared;
