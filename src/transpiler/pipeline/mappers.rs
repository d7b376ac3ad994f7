//! Concrete text mappers, one per pipeline stage

pub mod brace_layout;
pub mod normalize_lines;
pub mod reflow;
pub mod rewrite_sigils;
pub mod split_braces;
pub mod strip_comments;
pub mod translate_lines;

pub use brace_layout::BraceLayoutMapper;
pub use normalize_lines::NormalizeLinesMapper;
pub use reflow::ReflowMapper;
pub use rewrite_sigils::RewriteSigilsMapper;
pub use split_braces::SplitBracesMapper;
pub use strip_comments::StripCommentsMapper;
pub use translate_lines::TranslateLinesMapper;
