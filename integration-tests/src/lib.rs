#[cfg(test)]
mod utils;

#[cfg(test)]
mod channel_flow;
#[cfg(test)]
mod consistency;
