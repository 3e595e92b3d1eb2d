//! Everything that lives on the screen: the car, the obstacles, the fuel station, and how they collide.

pub mod bitmaps;
pub mod collision;
pub mod fuel;
pub mod obstacle;
pub mod player;
pub mod sprite;

pub use collision::{CollisionOutcome, Scene};
pub use fuel::{FuelStation, RefuelState, SchedulerState};
pub use obstacle::{HazardPool, ObstacleKind, ObstaclePool, TerrainPool};
pub use player::{Pedals, Player, Steering};
pub use sprite::{Bitmap, Sprite};
