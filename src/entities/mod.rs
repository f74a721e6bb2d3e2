pub mod prelude;

pub mod documents;
