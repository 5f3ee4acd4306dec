use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub nominatim_api_base: String,
    pub osrm_api_base: String,
    pub country_codes: String,
    pub language: String,
    pub result_limit: u32,
    pub search_debounce: Duration,
    pub session_idle_timeout: Duration,
    pub session_sweep_interval: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            nominatim_api_base: "nominatim.openstreetmap.org".into(),
            osrm_api_base: "router.project-osrm.org".into(),
            country_codes: "vn".into(),
            language: "vi".into(),
            result_limit: 5,
            search_debounce: Duration::from_millis(300),
            session_idle_timeout: Duration::from_secs(30 * 60),
            session_sweep_interval: Duration::from_secs(60),
            user_agent: concat!("vectura/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl Config {
    /// Reads settings from the environment (and `.env`, if present), keeping
    /// defaults for anything unset.
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let defaults = Config::default();

        Ok(Self {
            listen_addr: parse_var("VECTURA_LISTEN_ADDR")?.unwrap_or(defaults.listen_addr),
            nominatim_api_base: string_var("NOMINATIM_API_BASE")?
                .unwrap_or(defaults.nominatim_api_base),
            osrm_api_base: string_var("OSRM_API_BASE")?.unwrap_or(defaults.osrm_api_base),
            country_codes: string_var("GEOCODER_COUNTRY_CODES")?
                .unwrap_or(defaults.country_codes),
            language: string_var("GEOCODER_LANGUAGE")?.unwrap_or(defaults.language),
            result_limit: parse_var("GEOCODER_LIMIT")?.unwrap_or(defaults.result_limit),
            search_debounce: parse_var("SEARCH_DEBOUNCE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
            session_idle_timeout: parse_var("SESSION_IDLE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_idle_timeout),
            session_sweep_interval: match parse_var::<u64>("SESSION_SWEEP_INTERVAL_SECS")? {
                Some(0) => {
                    tracing::error!("SESSION_SWEEP_INTERVAL_SECS must be positive");
                    return Err(invalid_input_error());
                }
                Some(secs) => Duration::from_secs(secs),
                None => defaults.session_sweep_interval,
            },
            user_agent: string_var("HTTP_USER_AGENT")?.unwrap_or(defaults.user_agent),
        })
    }
}

fn string_var(key: &str) -> Result<Option<String>, Error> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, Error> {
    match string_var(key)? {
        Some(value) => {
            let parsed = value.trim().parse().map_err(|_| {
                tracing::error!("unparsable value for {}: {:?}", key, value);
                invalid_input_error()
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

#[test]
fn parse_var_reads_and_validates() {
    env::set_var("VECTURA_TEST_DEBOUNCE", " 120 ");
    assert_eq!(parse_var::<u64>("VECTURA_TEST_DEBOUNCE"), Ok(Some(120)));

    env::set_var("VECTURA_TEST_DEBOUNCE", "soon");
    assert_eq!(
        parse_var::<u64>("VECTURA_TEST_DEBOUNCE"),
        Err(invalid_input_error())
    );

    env::remove_var("VECTURA_TEST_DEBOUNCE");
    assert_eq!(parse_var::<u64>("VECTURA_TEST_DEBOUNCE"), Ok(None));
}
