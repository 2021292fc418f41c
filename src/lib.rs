pub mod error;
pub mod net;
pub mod queue;
pub mod route;
pub mod sim;
pub mod topo;

#[cfg(test)]
mod test;
