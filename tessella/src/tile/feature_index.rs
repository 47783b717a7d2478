use std::collections::HashMap;

use tessella_api::{CollisionTile, Feature, TileData};

/// Maps bucket names to the style layers that render them, for one committed
/// layout generation.
///
/// The layer walk runs in reverse style order, so when several layers share
/// a bucket name the later style layer registers first and becomes the
/// canonical association. After placement the collision state of the pass is
/// attached here, keeping everything a feature query needs in one place.
#[derive(Debug, Default)]
pub struct FeatureIndex {
    /// bucket name -> (layer id, source layer), in claim order.
    bucket_layers: HashMap<String, Vec<(String, String)>>,
    collision: Option<CollisionTile>,
}

impl FeatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bucket_layer(&mut self, bucket_name: &str, layer_id: &str, source_layer: &str) {
        self.bucket_layers
            .entry(bucket_name.to_string())
            .or_default()
            .push((layer_id.to_string(), source_layer.to_string()));
    }

    /// Layer ids registered for `bucket_name`, in claim order.
    pub fn bucket_layer_ids(&self, bucket_name: &str) -> Vec<String> {
        self.bucket_layers
            .get(bucket_name)
            .map(|layers| layers.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default()
    }

    /// The layer that claimed `bucket_name` first.
    pub fn canonical_layer(&self, bucket_name: &str) -> Option<&str> {
        self.bucket_layers
            .get(bucket_name)
            .and_then(|layers| layers.first())
            .map(|(id, _)| id.as_str())
    }

    pub fn set_collision_tile(&mut self, collision: CollisionTile) {
        self.collision = Some(collision);
    }

    pub fn collision_tile(&self) -> Option<&CollisionTile> {
        self.collision.as_ref()
    }

    /// Resolve features for every registered layer, optionally restricted to
    /// `layer_ids`. Geometric filtering belongs to the bucket internals; this
    /// surface answers which features of which source layers render where.
    pub fn query(
        &self,
        data: &dyn TileData,
        layer_ids: Option<&[String]>,
    ) -> HashMap<String, Vec<Feature>> {
        let mut results: HashMap<String, Vec<Feature>> = HashMap::new();
        for layers in self.bucket_layers.values() {
            for (layer_id, source_layer) in layers {
                if let Some(filter) = layer_ids {
                    if !filter.iter().any(|wanted| wanted == layer_id) {
                        continue;
                    }
                }
                let Some(source) = data.layer(source_layer) else {
                    continue;
                };
                let features: Vec<Feature> = (0..source.feature_count())
                    .map(|index| Feature {
                        layer_id: layer_id.clone(),
                        source_layer: source_layer.clone(),
                        index,
                    })
                    .collect();
                if !features.is_empty() {
                    results.insert(layer_id.clone(), features);
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessella_api::{DataLayer, PlacementConfig};

    struct FakeLayer {
        name: String,
        features: usize,
    }

    impl DataLayer for FakeLayer {
        fn name(&self) -> &str {
            &self.name
        }

        fn feature_count(&self) -> usize {
            self.features
        }
    }

    struct FakeData {
        layers: Vec<Arc<FakeLayer>>,
    }

    impl TileData for FakeData {
        fn layer(&self, name: &str) -> Option<Arc<dyn DataLayer>> {
            self.layers
                .iter()
                .find(|layer| layer.name == name)
                .map(|layer| layer.clone() as Arc<dyn DataLayer>)
        }
    }

    #[test]
    fn first_claimant_is_canonical() {
        let mut index = FeatureIndex::new();
        index.add_bucket_layer("roads", "roads-casing", "roads");
        index.add_bucket_layer("roads", "roads-fill", "roads");

        assert_eq!(index.canonical_layer("roads"), Some("roads-casing"));
        assert_eq!(
            index.bucket_layer_ids("roads"),
            vec!["roads-casing".to_string(), "roads-fill".to_string()]
        );
        assert_eq!(index.canonical_layer("water"), None);
    }

    #[test]
    fn query_resolves_features_per_layer() {
        let mut index = FeatureIndex::new();
        index.add_bucket_layer("roads", "roads-fill", "roads");
        index.add_bucket_layer("water", "water-fill", "water");

        let data = FakeData {
            layers: vec![Arc::new(FakeLayer {
                name: "roads".to_string(),
                features: 2,
            })],
        };

        let all = index.query(&data, None);
        assert_eq!(all.len(), 1);
        assert_eq!(all["roads-fill"].len(), 2);
        assert_eq!(all["roads-fill"][0].index, 0);

        let filter = vec!["water-fill".to_string()];
        assert!(index.query(&data, Some(&filter)).is_empty());
    }

    #[test]
    fn collision_state_attaches_after_placement() {
        let mut index = FeatureIndex::new();
        assert!(index.collision_tile().is_none());

        index.set_collision_tile(CollisionTile::new(PlacementConfig::default()));
        assert!(index.collision_tile().is_some());
    }
}
