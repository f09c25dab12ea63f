//! Render composition.
//!
//! A flow describes what it wants drawn as a [`Render`] tree. The frame loop
//! flattens it into a list of [`Instanced`] draws which it feeds to both the
//! shadow pass and the main pass.

use crate::data_structures::{model::Model, scene_graph::SceneNode};

/// A model plus the instance buffer that places it.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
    pub id: u32,
}

pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn flatten(self, out: &mut Vec<Instanced<'a>>) {
        match self {
            Render::None => (),
            Render::Default(instanced) => out.push(instanced),
            Render::Defaults(mut vec) => out.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.flatten(out)),
        }
    }
}

impl<'a> From<&'a dyn SceneNode> for Render<'a> {
    fn from(sn: &'a dyn SceneNode) -> Self {
        Render::Defaults(sn.get_render())
    }
}
