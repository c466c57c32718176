/// Frame section timer. A disabled timer reads zero and costs no clock call.
#[derive(Clone, Copy)]
pub(crate) struct PerfTimer {
    #[cfg(target_arch = "wasm32")]
    start_ms: Option<f64>,
    #[cfg(not(target_arch = "wasm32"))]
    start: Option<std::time::Instant>,
}

impl PerfTimer {
    pub(crate) fn start_if(enabled: bool) -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            PerfTimer { start_ms: enabled.then(js_sys::Date::now) }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            PerfTimer { start: enabled.then(std::time::Instant::now) }
        }
    }

    pub(crate) fn elapsed_ms(&self) -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            self.start_ms.map_or(0.0, |start| js_sys::Date::now() - start)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.start.map_or(0.0, |start| start.elapsed().as_secs_f64() * 1000.0)
        }
    }
}
