//! Record transports for the lock-step link.
//!
//! A transport moves whole records: one `send` delivers exactly one buffer
//! and one `recv` fills exactly one buffer. Any other length means the two
//! sides disagree about the port layout and is reported as an error.

use crate::common::TransportError;
use std::collections::VecDeque;

/// Record-oriented, blocking transport.
pub trait Transport {
    /// Sends `buf` as one record.
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError>;

    /// Blocks until one record arrives and copies it into `buf`.
    ///
    /// The record must be exactly `buf.len()` bytes long.
    fn recv(&mut self, buf: &mut [u8]) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        (**self).send(buf)
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        (**self).recv(buf)
    }
}

/// In-memory transport that records sent frames and replays queued replies.
///
/// Used to drive the harness without a hardware simulator.
#[derive(Debug, Default)]
pub struct Loopback {
    sent: Vec<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a record to be returned by a later `recv`.
    pub fn queue_reply(&mut self, reply: Vec<u8>) {
        self.replies.push_back(reply);
    }

    /// Records sent so far, oldest first.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// Number of queued replies not yet received.
    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }
}

impl Transport for Loopback {
    fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        self.sent.push(buf.to_vec());
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
        let reply = self.replies.pop_front().ok_or(TransportError::Closed)?;
        if reply.len() != buf.len() {
            return Err(TransportError::Length {
                expected: buf.len(),
                actual: reply.len(),
            });
        }
        buf.copy_from_slice(&reply);
        Ok(())
    }
}

#[cfg(target_os = "linux")]
pub use self::unix::{SeqPacketSocket, NAME_MAXLEN};

#[cfg(target_os = "linux")]
mod unix {
    use super::Transport;
    use crate::common::TransportError;
    use std::io;
    use std::mem;
    use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
    use std::thread;
    use std::time::Duration;

    /// Longest socket name the VHDL side can hold.
    pub const NAME_MAXLEN: usize = 32;

    /// `AF_UNIX` / `SOCK_SEQPACKET` socket in the abstract namespace.
    ///
    /// Sequenced-packet sockets preserve record boundaries, so every
    /// `send` on one side matches exactly one `recv` on the other.
    pub struct SeqPacketSocket {
        fd: OwnedFd,
    }

    impl SeqPacketSocket {
        /// Connects to the listener `name`, retrying every `retry` while the
        /// peer refuses the connection (it has not started listening yet).
        pub fn connect(name: &str, retry: Duration) -> Result<Self, TransportError> {
            let (addr, len) = abstract_addr(name)?;
            let fd = new_socket()?;
            let mut attempts = 0u64;
            loop {
                // SAFETY: `addr` is a valid, initialised sockaddr_un of `len` bytes.
                let rc = unsafe {
                    libc::connect(
                        fd.as_raw_fd(),
                        &addr as *const libc::sockaddr_un as *const libc::sockaddr,
                        len,
                    )
                };
                if rc == 0 {
                    break;
                }
                let err = io::Error::last_os_error();
                if err.raw_os_error() != Some(libc::ECONNREFUSED) {
                    return Err(err.into());
                }
                if attempts == 0 {
                    log::info!("[Link] Waiting for '{}' to listen...", name);
                }
                attempts += 1;
                thread::sleep(retry);
            }
            log::info!("[Link] Connected to '{}' after {} retries", name, attempts);
            Ok(Self { fd })
        }

        /// Binds `name`, waits for one peer and returns the accepted connection.
        pub fn listen(name: &str) -> Result<Self, TransportError> {
            let (addr, len) = abstract_addr(name)?;
            let listener = new_socket()?;
            // SAFETY: see `connect`.
            let rc = unsafe {
                libc::bind(
                    listener.as_raw_fd(),
                    &addr as *const libc::sockaddr_un as *const libc::sockaddr,
                    len,
                )
            };
            if rc != 0 {
                return Err(io::Error::last_os_error().into());
            }
            // SAFETY: plain syscall on an owned descriptor.
            if unsafe { libc::listen(listener.as_raw_fd(), 1) } != 0 {
                return Err(io::Error::last_os_error().into());
            }
            // SAFETY: null address pointers are allowed when the peer address is not wanted.
            let fd = unsafe {
                libc::accept4(
                    listener.as_raw_fd(),
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    libc::SOCK_CLOEXEC,
                )
            };
            if fd < 0 {
                return Err(io::Error::last_os_error().into());
            }
            log::info!("[Link] Accepted peer on '{}'", name);
            // SAFETY: `fd` was just returned by accept4 and is owned by nobody else.
            Ok(Self {
                fd: unsafe { OwnedFd::from_raw_fd(fd) },
            })
        }
    }

    impl AsRawFd for SeqPacketSocket {
        fn as_raw_fd(&self) -> RawFd {
            self.fd.as_raw_fd()
        }
    }

    impl Transport for SeqPacketSocket {
        fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
            // SAFETY: `buf` is valid for `buf.len()` bytes.
            let n = unsafe {
                libc::send(
                    self.fd.as_raw_fd(),
                    buf.as_ptr() as *const libc::c_void,
                    buf.len(),
                    libc::MSG_NOSIGNAL,
                )
            };
            check_len(n, buf.len())
        }

        /// With `MSG_TRUNC` the kernel reports the full record length, so an
        /// oversized record fails `check_len` instead of being cut silently.
        fn recv(&mut self, buf: &mut [u8]) -> Result<(), TransportError> {
            // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
            let n = unsafe {
                libc::recv(
                    self.fd.as_raw_fd(),
                    buf.as_mut_ptr() as *mut libc::c_void,
                    buf.len(),
                    libc::MSG_TRUNC,
                )
            };
            if n == 0 && !buf.is_empty() {
                return Err(TransportError::Closed);
            }
            check_len(n, buf.len())
        }
    }

    fn check_len(n: isize, expected: usize) -> Result<(), TransportError> {
        if n < 0 {
            return Err(io::Error::last_os_error().into());
        }
        if n as usize != expected {
            return Err(TransportError::Length {
                expected,
                actual: n as usize,
            });
        }
        Ok(())
    }

    fn new_socket() -> Result<OwnedFd, TransportError> {
        // SAFETY: plain syscall; the result is checked before use.
        let fd = unsafe { libc::socket(libc::AF_UNIX, libc::SOCK_SEQPACKET | libc::SOCK_CLOEXEC, 0) };
        if fd < 0 {
            return Err(io::Error::last_os_error().into());
        }
        // SAFETY: `fd` is a fresh descriptor owned by nobody else.
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }

    /// Builds `"\0" + name` in the abstract namespace.
    fn abstract_addr(name: &str) -> Result<(libc::sockaddr_un, libc::socklen_t), TransportError> {
        let bytes = name.as_bytes();
        if bytes.len() > NAME_MAXLEN {
            return Err(TransportError::NameTooLong(bytes.len()));
        }
        // SAFETY: sockaddr_un is plain old data; all-zero is a valid value.
        let mut addr: libc::sockaddr_un = unsafe { mem::zeroed() };
        addr.sun_family = libc::AF_UNIX as libc::sa_family_t;
        for (dst, &src) in addr.sun_path[1..].iter_mut().zip(bytes) {
            *dst = src as libc::c_char;
        }
        let len = mem::size_of::<libc::sa_family_t>() + 1 + bytes.len();
        Ok((addr, len as libc::socklen_t))
    }
}
