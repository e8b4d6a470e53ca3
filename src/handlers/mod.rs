// Public handlers issue credentials; protected handlers run every mutation
// through the authorization gate and the slug lifecycle.
pub mod protected;
pub mod public;
