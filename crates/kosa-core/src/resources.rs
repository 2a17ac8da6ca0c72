use std::ops::Add;

use kosa_protocol::{Resource, ResourceKind};

/// Per-kind resource totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResourceCounts {
    pub metal: u32,
    pub food: u32,
    pub oil: u32,
    pub wood: u32,
}

impl Add for ResourceCounts {
    type Output = ResourceCounts;

    fn add(self, other: ResourceCounts) -> ResourceCounts {
        ResourceCounts {
            metal: self.metal + other.metal,
            food: self.food + other.food,
            oil: self.oil + other.oil,
            wood: self.wood + other.wood,
        }
    }
}

impl<'a> FromIterator<&'a Resource> for ResourceCounts {
    fn from_iter<I: IntoIterator<Item = &'a Resource>>(iter: I) -> Self {
        let mut counts = ResourceCounts::default();
        for resource in iter {
            *counts.get_mut(resource.kind) += 1;
        }
        counts
    }
}

impl ResourceCounts {
    pub fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Metal => self.metal,
            ResourceKind::Food => self.food,
            ResourceKind::Oil => self.oil,
            ResourceKind::Wood => self.wood,
        }
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> &mut u32 {
        match kind {
            ResourceKind::Metal => &mut self.metal,
            ResourceKind::Food => &mut self.food,
            ResourceKind::Oil => &mut self.oil,
            ResourceKind::Wood => &mut self.wood,
        }
    }

    pub fn total(&self) -> u32 {
        self.metal + self.food + self.oil + self.wood
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kosa_protocol::{Field, Terrain};

    #[test]
    fn counts_by_kind() {
        let m6 = Field::new("m6", Terrain::Mountain);
        let resources = vec![
            Resource::new(m6.clone(), ResourceKind::Metal),
            Resource::new(m6.clone(), ResourceKind::Metal),
            Resource::new(m6, ResourceKind::Wood),
        ];
        let counts: ResourceCounts = resources.iter().collect();
        assert_eq!(counts.get(ResourceKind::Metal), 2);
        assert_eq!(counts.wood, 1);
        assert_eq!(counts.total(), 3);

        let doubled = counts + counts;
        assert_eq!(doubled.metal, 4);
    }
}
