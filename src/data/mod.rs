mod store;
mod types;

pub use store::{load_snapshot, save_snapshot};
pub use types::{
    closeness_label, sentiment_color, sentiment_label, Interaction, InteractionType, Person,
    RelationshipType, Snapshot,
};
