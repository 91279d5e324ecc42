//! Layer arena: owns every layer, resolves links by index.

use crate::config::RelaxConfig;
use crate::model::{BipolarVector, Matrix};
use crate::{Error, Result};

use super::{Layer, LayerId, Relaxation};

/// Owner of a set of layers and the only place links are dereferenced.
#[derive(Debug, Clone, Default)]
pub struct LayerArena {
    layers: Vec<Layer>,
}

impl LayerArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, layer: Layer) -> LayerId {
        self.layers.push(layer);
        LayerId(self.layers.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn get(&self, id: LayerId) -> Result<&Layer> {
        self.layers.get(id.0).ok_or_else(|| Error::UnknownLayer(id))
    }

    pub fn get_mut(&mut self, id: LayerId) -> Result<&mut Layer> {
        self.layers.get_mut(id.0).ok_or_else(|| Error::UnknownLayer(id))
    }

    pub fn state(&self, id: LayerId) -> Result<&BipolarVector> {
        Ok(self.get(id)?.state())
    }

    pub fn set_state(&mut self, id: LayerId, state: BipolarVector) -> Result<()> {
        self.get_mut(id)?.set_state(state)
    }

    /// Register `lower` as the lower neighbor of `id`.
    pub fn link_lower(&mut self, id: LayerId, lower: LayerId) -> Result<()> {
        let neighbor_size = self.get(lower)?.size();
        self.get_mut(id)?.link_lower(lower, neighbor_size);
        Ok(())
    }

    /// Register `upper` as the upper neighbor of `id`.
    pub fn link_upper(&mut self, id: LayerId, upper: LayerId) -> Result<()> {
        let neighbor_size = self.get(upper)?.size();
        self.get_mut(id)?.link_upper(upper, neighbor_size);
        Ok(())
    }

    /// Install weights on `id`, validated against its current neighbors.
    pub fn set_weights(&mut self, id: LayerId, lower: Matrix, upper: Matrix, thresholds: Vec<f64>) -> Result<()> {
        let layer = self.get(id)?;
        let lower_size = layer.lower().map(|l| self.get(l).map(Layer::size)).transpose()?;
        let upper_size = layer.upper().map(|u| self.get(u).map(Layer::size)).transpose()?;
        self.get_mut(id)?
            .install_weights(lower, upper, thresholds, lower_size, upper_size)
    }

    /// Synchronous apical update of `id` from its neighbors' current states.
    pub fn apical_update(&mut self, id: LayerId) -> Result<BipolarVector> {
        let layer = self.get(id)?;
        let lower = layer.lower().map(|l| self.state(l).cloned()).transpose()?;
        let upper = layer.upper().map(|u| self.state(u).cloned()).transpose()?;
        Ok(self.get_mut(id)?.activate(lower.as_ref(), upper.as_ref()))
    }

    /// Hopfield relaxation of an attractor layer.
    pub fn relax(&mut self, id: LayerId, config: &RelaxConfig) -> Result<Relaxation> {
        self.get_mut(id)?.relax(config)
    }
}

impl std::ops::Index<LayerId> for LayerArena {
    type Output = Layer;

    /// Panics on a handle from another arena.
    fn index(&self, id: LayerId) -> &Layer {
        &self.layers[id.0]
    }
}
