//! Render pipelines: the lit main pass, the sun's shadow pass and the
//! lighting rig they share.

pub mod basic;
pub mod light;
pub mod shadow;
