// Domain layer - Core models and pure logic
pub mod dataset;
pub mod recording;
pub mod sensor;
pub mod series;
pub mod system;
