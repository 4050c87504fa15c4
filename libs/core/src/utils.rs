use std::io::{self, Cursor, Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use curl::easy::Easy;
use failure::Error;
use failure_derive::Fail;
use zip::ZipArchive;

/// Shared between concurrent downloads, so one failure can stop the rest
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);
impl CancellationToken {
    #[inline]
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
    #[inline]
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

#[inline]
pub fn download_buffer(url: &str, token: &CancellationToken) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::with_capacity(2048);
    {
        let mut cursor = Cursor::new(buffer);
        download(url, &mut cursor, token)?;
        buffer = cursor.into_inner();
    }
    Ok(buffer)
}

fn download<W: Write>(url: &str, output: &mut W, token: &CancellationToken) -> Result<(), Error> {
    token.check()?;
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.fail_on_error(true)?;
    easy.follow_location(true)?;
    easy.progress(true)?;
    let mut error: Option<io::Error> = None;
    let result = {
        let mut transfer = easy.transfer();
        transfer.write_function(
            |data| if let Err(e) = output.write_all(data) {
                error = Some(e);
                Ok(0)
            } else {
                Ok(data.len())
            },
        )?;
        // Returning false aborts the transfer
        transfer.progress_function(|_, _, _, _| !token.is_cancelled())?;
        transfer.perform()
    };
    if token.is_cancelled() {
        return Err(Cancelled.into())
    }
    if easy.response_code()? == 404 {
        return Err(HttpNotFound(url.into()).into())
    }
    match result {
        Err(e) => {
            if let Some(actual_error) = error.take() {
                Err(actual_error.into())
            } else {
                Err(e.into())
            }
        }
        Ok(_) => {
            debug_assert!(error.is_none());
            Ok(())
        }
    }
}

/// Read a single file out of an in-memory zip archive
pub fn read_zip_entry(buffer: &[u8], name: &str) -> Result<Vec<u8>, Error> {
    let mut archive = ZipArchive::new(Cursor::new(buffer))?;
    let mut entry = archive.by_name(name)?;
    let mut result = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut result)?;
    Ok(result)
}

#[derive(Debug, Fail)]
#[fail(display = "HTTP 404 not found: {}", _0)]
pub struct HttpNotFound(pub String);

#[derive(Debug, Fail)]
#[fail(display = "Cancelled")]
pub struct Cancelled;
