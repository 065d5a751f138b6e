mod batch;
pub mod mention_id;
mod tweet;

pub use batch::Batch;
pub use mention_id::MentionId;
pub use tweet::{
    ApiError, Includes, Mention, PageMeta, PublicMetrics, Tweet, TweetPage, TweetReference, User,
    REPLIED_TO,
};
