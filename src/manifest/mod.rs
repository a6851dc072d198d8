//! Deployment manifest parsing and image tag rewriting.

pub mod document;
pub mod image;

pub use document::{ManifestDocument, Node, Scalar};
pub use image::{TagRewrite, find_current_tag, replace_tag, rewrite_image_tag};
