//! Simulator client
//!
//! Every call opens a fresh TCP connection with a connect timeout, then runs
//! the whole exchange under one read/write deadline. Nothing is retried here;
//! the live loop simply tries again next cycle.

use std::collections::HashMap;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::broker::{BoatData, BoatKey, GroupMember};
use crate::config::SimulatorSettings;
use crate::simulator::protocol::{self, LiveDataLine};
use crate::utils::{GatewayError, Result};

#[derive(Debug, Clone)]
pub struct SimulatorClient {
    addr: String,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl SimulatorClient {
    pub fn new(addr: impl Into<String>, connect_timeout: Duration, io_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
            io_timeout,
        }
    }

    pub fn from_settings(settings: &SimulatorSettings) -> Self {
        Self::new(
            settings.addr(),
            settings.connect_timeout(),
            settings.io_timeout(),
        )
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Fetch one live sample per key.
    ///
    /// Never fails: a connect error, timeout, read error or `error` line ends
    /// the exchange and whatever was parsed up to that point is returned.
    pub async fn fetch_live_data(&self, keys: &[BoatKey]) -> HashMap<BoatKey, BoatData> {
        let mut samples = HashMap::with_capacity(keys.len());
        if keys.is_empty() {
            return samples;
        }

        if let Err(e) = self.exchange_live_data(keys, &mut samples).await {
            warn!(
                error = %e,
                requested = keys.len(),
                parsed = samples.len(),
                "live data fetch cut short"
            );
        }
        samples
    }

    async fn exchange_live_data(
        &self,
        keys: &[BoatKey],
        samples: &mut HashMap<BoatKey, BoatData>,
    ) -> Result<()> {
        let stream = self.connect().await?;
        let (read_half, mut write_half) = stream.into_split();

        // The simulator may answer before every request is written, so both
        // directions run at once.
        let writer = async {
            for key in keys {
                write_half
                    .write_all(protocol::live_data_request(key).as_bytes())
                    .await?;
            }
            write_half.flush().await?;
            Ok::<(), GatewayError>(())
        };

        let reader = async {
            let mut lines = BufReader::new(read_half).lines();
            for _ in 0..keys.len() {
                let line = lines.next_line().await?.ok_or_else(|| {
                    GatewayError::Protocol("simulator closed the connection early".to_string())
                })?;

                match protocol::parse_live_data_line(&line)? {
                    LiveDataLine::Sample { key, data } => {
                        samples.insert(key, data);
                    }
                    LiveDataLine::NoBoat(key) => info!(key = %key, "no boat for key"),
                    LiveDataLine::Malformed(line) => {
                        debug!(line = %line, "skipping malformed live data line");
                    }
                    LiveDataLine::Unexpected { key, status } => {
                        warn!(key = %key, status = %status, "unexpected response from simulator");
                    }
                }
            }
            Ok::<(), GatewayError>(())
        };

        timeout(self.io_timeout, async { tokio::try_join!(writer, reader) })
            .await
            .map_err(|_| GatewayError::ExchangeTimeout)??;
        Ok(())
    }

    /// Fetch the group roster for `key`, hidden members excluded.
    pub async fn fetch_group_members(&self, key: &BoatKey) -> Result<Vec<GroupMember>> {
        let stream = self.connect().await?;
        let (read_half, mut write_half) = stream.into_split();

        let exchange = async {
            write_half
                .write_all(protocol::group_members_request(key).as_bytes())
                .await?;
            write_half.flush().await?;

            let mut lines = BufReader::new(read_half).lines();
            let header = lines.next_line().await?.ok_or_else(|| {
                GatewayError::Protocol("simulator closed before roster header".to_string())
            })?;
            protocol::parse_roster_header(&header, key)?;

            let mut members = Vec::new();
            loop {
                let line = lines.next_line().await?.ok_or_else(|| {
                    GatewayError::Protocol("roster ended without a blank line".to_string())
                })?;
                let line = protocol::trim_line(&line);
                if line.is_empty() {
                    break;
                }
                match protocol::parse_roster_entry(line) {
                    Some(member) => members.push(member),
                    None => debug!(line = %line, "skipping roster entry"),
                }
            }
            Ok::<_, GatewayError>(members)
        };

        let members = timeout(self.io_timeout, exchange)
            .await
            .map_err(|_| GatewayError::ExchangeTimeout)??;

        debug!(key = %key, members = members.len(), "group roster fetched");
        Ok(members)
    }

    async fn connect(&self) -> Result<TcpStream> {
        let stream = timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| GatewayError::ConnectTimeout)??;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
