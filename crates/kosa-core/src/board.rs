use std::collections::{BTreeMap, BTreeSet, VecDeque};

use kosa_protocol::{Field, FieldId, Terrain};

use crate::rules::RulesError;

#[derive(Clone, Debug)]
struct BoardField {
    terrain: Terrain,
    neighbours: Vec<FieldId>,
}

/// The static field graph. Lakes can never be entered, home bases can be left
/// but not entered, and rivers cut the edge between two otherwise adjacent fields.
#[derive(Clone, Debug)]
pub struct Board {
    fields: BTreeMap<FieldId, BoardField>,
    /// Stored with the smaller id first.
    rivers: BTreeSet<(FieldId, FieldId)>,
}

fn edge(a: &FieldId, b: &FieldId) -> (FieldId, FieldId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl Board {
    /// Build a board, checking that every neighbour exists and adjacency is symmetric.
    pub fn new(
        fields: impl IntoIterator<Item = (FieldId, Terrain, Vec<FieldId>)>,
        rivers: impl IntoIterator<Item = (FieldId, FieldId)>,
    ) -> Result<Self, RulesError> {
        let fields = fields
            .into_iter()
            .map(|(id, terrain, neighbours)| {
                (
                    id,
                    BoardField {
                        terrain,
                        neighbours,
                    },
                )
            })
            .collect::<BTreeMap<_, _>>();

        for (id, field) in &fields {
            for neighbour in &field.neighbours {
                let back = fields
                    .get(neighbour)
                    .ok_or_else(|| RulesError::MissingId(neighbour.to_string()))?;
                if !back.neighbours.contains(id) {
                    return Err(RulesError::AsymmetricEdge {
                        from: id.to_string(),
                        to: neighbour.to_string(),
                    });
                }
            }
        }

        let mut river_set = BTreeSet::new();
        for (a, b) in rivers {
            let adjacent = fields
                .get(&a)
                .ok_or_else(|| RulesError::MissingId(a.to_string()))?
                .neighbours
                .contains(&b);
            if !adjacent {
                return Err(RulesError::RiverWithoutEdge {
                    from: a.to_string(),
                    to: b.to_string(),
                });
            }
            river_set.insert(edge(&a, &b));
        }

        Ok(Self {
            fields,
            rivers: river_set,
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, id: &FieldId) -> Option<Field> {
        self.fields.get(id).map(|f| Field {
            id: id.clone(),
            terrain: f.terrain,
        })
    }

    /// Convenience lookup by raw id.
    pub fn get(&self, id: &str) -> Option<Field> {
        self.field(&FieldId::new(id))
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields.iter().map(|(id, f)| Field {
            id: id.clone(),
            terrain: f.terrain,
        })
    }

    pub fn neighbours(&self, id: &FieldId) -> &[FieldId] {
        self.fields
            .get(id)
            .map(|f| f.neighbours.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_river(&self, a: &FieldId, b: &FieldId) -> bool {
        self.rivers.contains(&edge(a, b))
    }

    fn can_enter(&self, id: &FieldId) -> bool {
        self.fields
            .get(id)
            .is_some_and(|f| !matches!(f.terrain, Terrain::Lake | Terrain::Homebase))
    }

    /// Fields a unit standing on `from` can end on within `distance` steps, in board order.
    pub fn reachable_from(&self, from: &FieldId, distance: u32) -> Vec<Field> {
        let mut dist: BTreeMap<&FieldId, u32> = BTreeMap::new();
        let Some((start, _)) = self.fields.get_key_value(from) else {
            return Vec::new();
        };
        dist.insert(start, 0);

        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            let d = dist.get(id).copied().unwrap_or(0);
            if d >= distance {
                continue;
            }
            for neighbour in self.neighbours(id) {
                if dist.contains_key(neighbour)
                    || self.has_river(id, neighbour)
                    || !self.can_enter(neighbour)
                {
                    continue;
                }
                dist.insert(neighbour, d + 1);
                queue.push_back(neighbour);
            }
        }

        dist.into_keys()
            .filter(|id| *id != start)
            .filter_map(|id| self.field(id))
            .collect()
    }

    pub fn is_reachable(&self, from: &FieldId, to: &FieldId, distance: u32) -> bool {
        self.reachable_from(from, distance)
            .iter()
            .any(|field| &field.id == to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{load_rules, RulesSource};

    fn board() -> Board {
        load_rules(RulesSource::Embedded).expect("rules load").board
    }

    fn id(s: &str) -> FieldId {
        FieldId::new(s)
    }

    #[test]
    fn factory_is_connected_to_three_non_lake_fields() {
        let board = board();
        assert!(board.is_reachable(&id("F"), &id("w3"), 1));
        assert!(board.is_reachable(&id("F"), &id("t5"), 1));
        assert!(board.is_reachable(&id("F"), &id("m4"), 1));
        assert_eq!(board.reachable_from(&id("F"), 1).len(), 3);
    }

    #[test]
    fn rivers_block_walking() {
        let board = board();
        assert!(board.has_river(&id("v1"), &id("t3")));
        assert!(!board.is_reachable(&id("t3"), &id("v1"), 1));
        assert!(board.is_reachable(&id("t3"), &id("w3"), 1));
    }

    #[test]
    fn lakes_and_home_bases_cannot_be_entered() {
        let board = board();
        assert!(!board.is_reachable(&id("t3"), &id("l2"), 1));
        assert!(!board.is_reachable(&id("black"), &id("green"), 1));
        assert!(!board.is_reachable(&id("m6"), &id("black"), 1));
        assert!(board.is_reachable(&id("black"), &id("m6"), 1));
    }

    #[test]
    fn distance_extends_the_search() {
        let board = board();
        assert!(!board.is_reachable(&id("green"), &id("t2"), 1));
        assert!(board.is_reachable(&id("green"), &id("t2"), 2));
        assert!(!board.is_reachable(&id("m6"), &id("m6"), 3));
    }

    #[test]
    fn asymmetric_adjacency_is_rejected() {
        let result = Board::new(
            vec![
                (id("a"), Terrain::Farm, vec![id("b")]),
                (id("b"), Terrain::Farm, vec![]),
            ],
            vec![],
        );
        assert!(matches!(result, Err(RulesError::AsymmetricEdge { .. })));

        let result = Board::new(vec![(id("a"), Terrain::Farm, vec![id("zz")])], vec![]);
        assert!(matches!(result, Err(RulesError::MissingId(missing)) if missing == "zz"));
    }

    #[test]
    fn unknown_fields_have_no_neighbours() {
        let board = board();
        assert!(board.get("nowhere").is_none());
        assert!(board.neighbours(&id("nowhere")).is_empty());
        assert!(board.reachable_from(&id("nowhere"), 2).is_empty());
        assert_eq!(board.get("m6").map(|f| f.terrain), Some(Terrain::Mountain));
    }
}
