//! Index structures held by a snapshot
//!
//! All structures refer to tags by [`TagId`], the position of the record in
//! the retained record stream. Names live once, in the snapshot.
//!
//! - [`ExactIndex`]: normalized canonical name -> tag
//! - [`AliasIndex`]: normalized alias -> tag, last write wins
//! - [`PrefixTrie`]: every tag whose normalized name starts with a prefix
//! - [`WordIndex`]: token -> posting list, AND intersection
//! - [`PopularityOrder`]: usage-count ranking oracle

mod alias;
mod exact;
mod popularity;
mod prefix;
mod word;

pub use alias::AliasIndex;
pub use exact::ExactIndex;
pub use popularity::PopularityOrder;
pub use prefix::PrefixTrie;
pub use word::WordIndex;

/// Position of a retained record in build order.
pub type TagId = u32;
