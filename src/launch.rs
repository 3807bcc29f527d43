//! Launch URLs for contestant benchmark pages.
//!
//! A benchmark page opened with `report=true` posts its samples back to the dashboard
//! when it finishes. The remaining query flags tune the benchmark run itself and have no
//! effect on aggregation.

use serde::Serialize;
use url::Url;

/// Options appended to a contestant's benchmark URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub iterations: u32,
    pub disable_scu: bool,
    pub enable_dom_recycling: bool,
    pub mobile_mode: bool,
    /// Restrict the benchmark page to test cases matching this text.
    pub test_filter: Option<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            iterations: 3,
            disable_scu: false,
            enable_dom_recycling: false,
            mobile_mode: false,
            test_filter: None,
        }
    }
}

/// `base` with the launch query appended. Existing query pairs are kept.
pub fn launch_url(base: &Url, opts: &LaunchOptions) -> Url {
    let mut url = base.clone();
    {
        let mut q = url.query_pairs_mut();
        q.append_pair("report", "true");
        q.append_pair("i", &opts.iterations.to_string());
        if opts.disable_scu {
            q.append_pair("disableSCU", "true");
        }
        if opts.enable_dom_recycling {
            q.append_pair("enableDOMRecycling", "true");
        }
        if opts.mobile_mode {
            q.append_pair("mobile", "true");
        }
        if let Some(filter) = opts.test_filter.as_deref().filter(|f| !f.is_empty()) {
            q.append_pair("filter", filter);
        }
    }
    url
}

/// A known benchmark implementation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Contestant {
    pub name: &'static str,
    pub url: &'static str,
    pub benchmark_url: &'static str,
    pub comments: &'static str,
}

impl Contestant {
    pub fn launch_url(&self, opts: &LaunchOptions) -> Result<Url, url::ParseError> {
        Ok(launch_url(&Url::parse(self.benchmark_url)?, opts))
    }
}

pub const CONTESTANTS: &[Contestant] = &[
    Contestant {
        name: "React 15",
        url: "https://facebook.github.io/react/",
        benchmark_url: "https://localvoid.github.io/uibench-react-dev/",
        comments: "Virtual DOM. Compiled with: es2015-loose, transform-react-inline-elements.",
    },
    Contestant {
        name: "React 15 [Functional Components]",
        url: "https://facebook.github.io/react/",
        benchmark_url: "https://localvoid.github.io/uibench-react-dev/fc.html",
        comments: "Virtual DOM. No sCU support.",
    },
    Contestant {
        name: "Bobril",
        url: "https://github.com/Bobris/Bobril",
        benchmark_url: "https://bobris.github.io/uibench-bobril/",
        comments: "Virtual DOM.",
    },
    Contestant {
        name: "Deku",
        url: "https://github.com/dekujs/deku",
        benchmark_url: "https://localvoid.github.io/uibench-deku/",
        comments: "Virtual DOM.",
    },
    Contestant {
        name: "Mercury",
        url: "https://github.com/Raynos/mercury",
        benchmark_url: "https://localvoid.github.io/uibench-mercury/",
        comments: "Virtual DOM (`virtual-dom` library).",
    },
    Contestant {
        name: "kivi [simple]",
        url: "https://github.com/localvoid/kivi",
        benchmark_url: "https://localvoid.github.io/uibench-kivi/simple.html",
        comments: "Virtual DOM, no advanced optimizations.",
    },
    Contestant {
        name: "kivi [advanced]",
        url: "https://github.com/localvoid/kivi",
        benchmark_url: "https://localvoid.github.io/uibench-kivi/advanced.html",
        comments: "Virtual DOM, all kivi optimizations except DOM node recycling.",
    },
    Contestant {
        name: "Preact",
        url: "https://github.com/developit/preact",
        benchmark_url: "https://developit.github.io/uibench-preact/",
        comments: "Virtual DOM. DOM node recycling on by default.",
    },
    Contestant {
        name: "React-lite",
        url: "https://github.com/Lucifier129/react-lite",
        benchmark_url: "https://localvoid.github.io/uibench-react-lite/",
        comments: "Virtual DOM.",
    },
    Contestant {
        name: "Imba",
        url: "https://github.com/somebee/imba",
        benchmark_url: "https://somebee.github.io/uibench-imba/",
        comments: "Language with a virtual-DOM-like UI library. DOM node recycling on by default.",
    },
    Contestant {
        name: "yo-yo",
        url: "https://github.com/maxogden/yo-yo",
        benchmark_url: "https://localvoid.github.io/uibench-yo-yo/",
        comments: "Real DOM diff/patch (`morphdom`). No sCU support.",
    },
    Contestant {
        name: "Snabbdom",
        url: "https://github.com/paldepind/snabbdom",
        benchmark_url: "https://localvoid.github.io/uibench-snabbdom/",
        comments: "Virtual DOM.",
    },
    Contestant {
        name: "Maquette",
        url: "http://maquettejs.org/",
        benchmark_url: "https://localvoid.github.io/uibench-maquette/",
        comments: "Virtual DOM. No sCU support.",
    },
];

/// Look up a built-in contestant by exact name.
pub fn find_contestant(name: &str) -> Option<&'static Contestant> {
    CONTESTANTS.iter().find(|c| c.name == name)
}
