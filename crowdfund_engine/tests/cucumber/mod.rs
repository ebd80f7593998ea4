mod steps;
mod world;

pub use world::CrowdfundWorld;
