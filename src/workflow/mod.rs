pub mod dashboard;
pub mod state;

#[cfg(test)]
mod tests;

pub use dashboard::Dashboard;
