pub mod badge;
pub mod contact;
pub mod cv;
pub mod hero;
pub mod metric;
pub mod project;
pub mod project_category;
pub mod user;

pub use badge::Entity as BadgeEntity;
pub use contact::Entity as ContactEntity;
pub use cv::Entity as CvEntity;
pub use hero::Entity as HeroEntity;
pub use metric::Entity as MetricEntity;
pub use project::Entity as ProjectEntity;
pub use project_category::Entity as ProjectCategoryEntity;
pub use user::Entity as UserEntity;
