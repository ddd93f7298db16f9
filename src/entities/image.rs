use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// One uploaded asset as mirrored from the media host into the owning record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageAsset {
    pub public_id: String,
    pub url: String,
    pub original_name: String,
}

/// JSON column holding the full image set of a product or brand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageSet(pub Vec<ImageAsset>);

impl ImageSet {
    pub fn public_ids(&self) -> Vec<String> {
        self.0.iter().map(|asset| asset.public_id.clone()).collect()
    }

    pub fn urls(&self) -> Vec<String> {
        self.0.iter().map(|asset| asset.url.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
