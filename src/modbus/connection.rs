use crate::error::{Error, Result};
use crate::modbus::{encoding, Comset, Connection, Protocol, Settings};

use {
    async_trait::async_trait,
    log::{debug, info, trace},
    std::{future::Future, time::Duration},
    tokio::sync::Mutex,
    tokio_modbus::{client::Context, prelude::*},
};

/// A `tokio-modbus` client bound to one slave. Transactions are serialized
/// through the context lock and bounded by `timeout`.
pub struct ModbusConnection {
    ctx: Mutex<Context>,
    name: String,
    timeout: Duration,
}

impl ModbusConnection {
    pub async fn new(settings: &Settings, id: u8) -> Result<Self> {
        let slave = Slave(id);
        let protocol = settings.protocol();

        let (ctx, name) = match protocol {
            Protocol::Rtu => {
                let device = settings
                    .device
                    .clone()
                    .ok_or_else(|| Error::Config("device must be set for rtu".to_string()))?;
                let comset: Comset = settings.comset.parse()?;

                let builder = tokio_serial::new(device.as_str(), settings.baudrate)
                    .data_bits(comset.data_bits)
                    .parity(comset.parity)
                    .stop_bits(comset.stop_bits)
                    .timeout(settings.timeout);
                let port = tokio_serial::SerialStream::open(&builder).map_err(std::io::Error::from)?;

                (tokio_modbus::client::rtu::attach_slave(port, slave), device)
            }
            Protocol::Tcp | Protocol::RtuOverTcp => {
                let address = settings
                    .address()
                    .ok_or_else(|| Error::Config("uri must be set for tcp".to_string()))?;
                let socket_addr = tokio::net::lookup_host(address.as_str())
                    .await?
                    .next()
                    .ok_or_else(|| Error::Config(format!("cannot resolve {}", address)))?;

                let ctx = if protocol == Protocol::RtuOverTcp {
                    let stream = Self::bounded(
                        settings.timeout,
                        tokio::net::TcpStream::connect(socket_addr),
                    )
                    .await??;
                    tokio_modbus::client::rtu::attach_slave(stream, slave)
                } else {
                    Self::bounded(
                        settings.timeout,
                        tokio_modbus::client::tcp::connect_slave(socket_addr, slave),
                    )
                    .await??
                };

                (ctx, address)
            }
        };

        info!("connected to {} ({:?}, id {})", name, protocol, id);

        Ok(Self {
            ctx: Mutex::new(ctx),
            name,
            timeout: settings.timeout,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    async fn bounded<F, T>(timeout: Duration, f: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout(timeout, f)
            .await
            .map_err(|_| Error::Timeout(timeout))
    }
}

#[async_trait]
impl Connection for ModbusConnection {
    async fn read_holding_registers(&self, address: u16, count: u16) -> Result<Vec<u8>> {
        let mut ctx = self.ctx.lock().await;
        let words = Self::bounded(self.timeout, ctx.read_holding_registers(address, count)).await???;
        let b = encoding::words_to_bytes(&words);
        trace!("{}: read holding {} x{} -> {:02x?}", self.name, address, count, b);
        Ok(b)
    }

    async fn read_input_registers(&self, address: u16, count: u16) -> Result<Vec<u8>> {
        let mut ctx = self.ctx.lock().await;
        let words = Self::bounded(self.timeout, ctx.read_input_registers(address, count)).await???;
        let b = encoding::words_to_bytes(&words);
        trace!("{}: read input {} x{} -> {:02x?}", self.name, address, count, b);
        Ok(b)
    }

    async fn write_single_register(&self, address: u16, value: u16) -> Result<()> {
        let mut ctx = self.ctx.lock().await;
        trace!("{}: write {} <- {}", self.name, address, value);
        Self::bounded(self.timeout, ctx.write_single_register(address, value)).await???;
        debug!("{}: wrote register {}", self.name, address);
        Ok(())
    }
}
