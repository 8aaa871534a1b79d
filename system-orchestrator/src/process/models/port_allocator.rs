use crate::error::OrchestratorError;

pub type Port = u16;

/// Hands out ports from `[initial, max]` in increasing order.
///
/// Ports are never returned to the pool, so no two workers of one run ever
/// share a port. Running past `max` is an error, never a wraparound.
#[derive(Debug, Clone)]
pub struct PortAllocator {
    next: u32,
    max: Port,
}

impl PortAllocator {
    pub fn new(initial: Port, max: Port) -> Result<Self, OrchestratorError> {
        if initial > max {
            return Err(OrchestratorError::InvalidPortRange { initial, max });
        }
        Ok(Self {
            next: u32::from(initial),
            max,
        })
    }

    pub fn allocate(&mut self) -> Result<Port, OrchestratorError> {
        if self.next > u32::from(self.max) {
            return Err(OrchestratorError::PortExhausted { max: self.max });
        }
        let port = self.next as Port;
        self.next += 1;
        Ok(port)
    }

    /// Ports still available.
    pub fn remaining(&self) -> usize {
        (u32::from(self.max) + 1).saturating_sub(self.next) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_are_handed_out_in_order() {
        let mut ports = PortAllocator::new(13140, 13399).unwrap();
        assert_eq!(ports.allocate().unwrap(), 13140);
        assert_eq!(ports.allocate().unwrap(), 13141);
        assert_eq!(ports.remaining(), 258);
    }

    #[test]
    fn max_port_is_usable_and_the_next_allocation_fails() {
        let mut ports = PortAllocator::new(13398, 13399).unwrap();
        ports.allocate().unwrap();
        assert_eq!(ports.allocate().unwrap(), 13399);
        assert!(matches!(
            ports.allocate(),
            Err(OrchestratorError::PortExhausted { max: 13399 })
        ));
        assert_eq!(ports.remaining(), 0);
    }

    #[test]
    fn top_of_the_port_space_does_not_overflow() {
        let mut ports = PortAllocator::new(u16::MAX, u16::MAX).unwrap();
        assert_eq!(ports.allocate().unwrap(), u16::MAX);
        assert!(ports.allocate().is_err());
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            PortAllocator::new(13400, 13399),
            Err(OrchestratorError::InvalidPortRange { .. })
        ));
    }
}
