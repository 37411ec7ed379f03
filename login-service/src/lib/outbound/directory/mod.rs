pub mod graphql;

pub use graphql::GraphQlUserDirectory;
