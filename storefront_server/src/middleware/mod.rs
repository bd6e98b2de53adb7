mod acl;

pub use acl::{AccessLevel, AclMiddlewareFactory, AclMiddlewareService};
