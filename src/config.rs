use std::env;

const DEFAULT_STATE_DATA_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSmxD385xNl6aKZBP4oyNT2xGT41O8MyT7Bm092dXv9jeD8ERv5MaENVzQwUvSOA7KXuRYrFQxFMaek/pub?gid=2043337507&single=true&output=csv";
const DEFAULT_NATIONAL_DATA_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSmxD385xNl6aKZBP4oyNT2xGT41O8MyT7Bm092dXv9jeD8ERv5MaENVzQwUvSOA7KXuRYrFQxFMaek/pub?gid=1592997347&single=true&output=csv";
const DEFAULT_UI_TEXT_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSmxD385xNl6aKZBP4oyNT2xGT41O8MyT7Bm092dXv9jeD8ERv5MaENVzQwUvSOA7KXuRYrFQxFMaek/pub?gid=539778071&single=true&output=csv";

// Tried in order until one loads; the boundary payload is cached afterward.
const DEFAULT_BOUNDARY_URLS: [&str; 2] = [
    "https://raw.githubusercontent.com/PublicaMundi/MappingAPI/master/data/geojson/us-states.json",
    "https://eric.clst.org/assets/wiki/uploads/Stuff/gz_2010_us_040_00_20m.json",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub state_data_url: String,
    pub national_data_url: String,
    pub ui_text_url: String,
    pub boundary_urls: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let boundary_urls = match env::var("DASHBOARD_BOUNDARY_URLS") {
            Ok(list) => list
                .split(',')
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
            Err(_) => DEFAULT_BOUNDARY_URLS.iter().map(|s| s.to_string()).collect(),
        };

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(8080),
            state_data_url: env_or("DASHBOARD_STATE_DATA_URL", DEFAULT_STATE_DATA_URL),
            national_data_url: env_or("DASHBOARD_NATIONAL_DATA_URL", DEFAULT_NATIONAL_DATA_URL),
            ui_text_url: env_or("DASHBOARD_UI_TEXT_URL", DEFAULT_UI_TEXT_URL),
            boundary_urls,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
