use glam::Vec3;

/// Narrow interface the animation writes through; the renderer owns what
/// happens to the transforms afterwards.
pub trait InstanceSink {
    fn set_instance_transform(&mut self, index: usize, position: Vec3, scale: f32);
}

/// One instanced point as laid out in the GPU vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub pos: [f32; 3],
    pub scale: f32,
}

/// CPU-side instance buffer, uploaded once per frame.
#[derive(Clone, Debug, Default)]
pub struct InstanceBuffer {
    instances: Vec<InstanceRaw>,
}

impl InstanceBuffer {
    pub fn with_len(len: usize) -> Self {
        Self {
            instances: vec![InstanceRaw::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl InstanceSink for InstanceBuffer {
    #[inline]
    fn set_instance_transform(&mut self, index: usize, position: Vec3, scale: f32) {
        if let Some(slot) = self.instances.get_mut(index) {
            slot.pos = position.to_array();
            slot.scale = scale;
        }
    }
}
