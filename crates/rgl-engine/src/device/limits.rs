/// Compute dispatch limits of a device.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ComputeLimits {
    /// Maximum workgroup count per dispatch dimension.
    pub max_workgroups_per_dimension: u32,
    /// Maximum `@workgroup_size` along x, y and z.
    pub max_workgroup_size: [u32; 3],
    /// Maximum invocations in one workgroup (product of its size).
    pub max_invocations: u32,
}

impl ComputeLimits {
    pub fn from_limits(limits: &wgpu::Limits) -> Self {
        Self {
            max_workgroups_per_dimension: limits.max_compute_workgroups_per_dimension,
            max_workgroup_size: [
                limits.max_compute_workgroup_size_x,
                limits.max_compute_workgroup_size_y,
                limits.max_compute_workgroup_size_z,
            ],
            max_invocations: limits.max_compute_invocations_per_workgroup,
        }
    }

    pub fn log(&self) {
        let [x, y, z] = self.max_workgroup_size;
        log::info!(
            "compute limits: {n} workgroups per dimension, workgroup size {x}x{y}x{z}, {i} invocations",
            n = self.max_workgroups_per_dimension,
            i = self.max_invocations,
        );
    }

    /// Whether a dispatch of `[x, y, z]` workgroups fits.
    pub fn allows_dispatch(&self, workgroups: [u32; 3]) -> bool {
        workgroups
            .iter()
            .all(|&n| n <= self.max_workgroups_per_dimension)
    }

    /// Whether a `@workgroup_size` fits.
    pub fn allows_workgroup_size(&self, size: [u32; 3]) -> bool {
        let per_axis = size
            .iter()
            .zip(self.max_workgroup_size)
            .all(|(&s, max)| s <= max);
        let total = size.iter().map(|&s| s as u64).product::<u64>();
        per_axis && total <= self.max_invocations as u64
    }
}

/// Workgroups needed to cover `extent` invocations with groups of `group_size`.
#[inline]
pub const fn workgroups_for(extent: u32, group_size: u32) -> u32 {
    extent.div_ceil(group_size)
}
