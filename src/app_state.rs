use crate::config::Config;
use crate::database::MaintenanceDatabase;

pub struct AppState {
    pub db: MaintenanceDatabase,
    pub config: Config,
}
