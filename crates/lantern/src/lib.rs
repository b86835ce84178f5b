#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod distance;
mod error;
mod expression;
mod extension;
mod index;
mod vector;

pub use crate::distance::{DistanceExpression, DistanceMetric, Operand};
pub use crate::error::{LanternError, LanternResult};
pub use crate::expression::{
    CosineDistance, L2Distance, LanternExpressionMethods, MaxInnerProduct, image_embedding,
    text_embedding,
};
pub use crate::extension::Extension;
pub use crate::index::{HnswIndex, opclass};
pub use crate::vector::Vector;
