//! Security tool allowlist.
//!
//! Commands whose base executable is in the allowlist are highlighted in
//! the report. The list lives in a user-editable file, one name per line,
//! blank lines and `#` comments ignored. Lookups are exact (case-sensitive)
//! on the basename.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Built-in list, used when the file is missing, empty or unreadable.
const DEFAULT_TOOLS: &[(&str, &[&str])] = &[
    (
        "recon & scanning",
        &[
            "nmap", "masscan", "rustscan", "nikto", "gobuster", "dirb", "dirsearch", "ffuf",
            "wfuzz", "feroxbuster",
        ],
    ),
    ("web", &["sqlmap", "nuclei", "httpx", "whatweb", "wafw00f"]),
    (
        "osint & subdomains",
        &["subfinder", "amass", "assetfinder", "waybackurls", "gau"],
    ),
    (
        "networking",
        &["curl", "wget", "ssh", "netcat", "nc", "ncat", "socat"],
    ),
    ("exploitation", &["msfconsole", "msfvenom"]),
    (
        "cracking",
        &["hashcat", "john", "hydra", "medusa", "crackmapexec", "netexec"],
    ),
    (
        "AD / post-exploitation",
        &["bloodhound", "sharphound", "mimikatz", "rubeus", "certipy"],
    ),
    ("scripting", &["python", "python3", "ruby", "perl", "php"]),
    (
        "dns",
        &["searchsploit", "dig", "host", "nslookup", "whois", "dnsrecon"],
    ),
    (
        "smb / ldap / enum",
        &["enum4linux", "smbclient", "rpcclient", "ldapsearch"],
    ),
    ("traffic", &["tcpdump", "tshark", "responder"]),
    ("tunneling", &["chisel", "ligolo", "proxychains"]),
    (
        "impacket",
        &[
            "impacket-smbexec",
            "impacket-wmiexec",
            "impacket-psexec",
            "impacket-secretsdump",
            "impacket-getTGT",
            "impacket-GetNPUsers",
        ],
    ),
    (
        "file transfer",
        &["scp", "rsync", "openssl", "testssl.sh", "certutil"],
    ),
    (
        "remote access",
        &["powershell", "evil-winrm", "xfreerdp", "rdesktop", "cme"],
    ),
    ("misc", &["kerbrute", "gopherus", "arjun", "paramspider"]),
];

/// Set of executable basenames treated as security tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolAllowlist {
    tools: BTreeSet<String>,
}

impl Default for ToolAllowlist {
    fn default() -> Self {
        Self::from_names(
            DEFAULT_TOOLS
                .iter()
                .flat_map(|(_, names)| names.iter().copied()),
        )
    }
}

impl ToolAllowlist {
    /// Build from any list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tools: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse the file format. Returns `None` when no names are listed.
    pub fn parse(content: &str) -> Option<Self> {
        let names: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(Self::from_names(names))
        }
    }

    /// Load from `path`, writing the default file first if it is missing.
    ///
    /// Falls back to the built-in list when the file cannot be created or
    /// lists nothing.
    pub fn load_or_init(path: &Path) -> Self {
        if !path.is_file() {
            if let Err(e) = write_default(path) {
                tracing::warn!("could not write default tool list to {:?}: {:#}", path, e);
                return Self::default();
            }
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_default(),
            Err(e) => {
                tracing::warn!("could not read tool list {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains(name)
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Render the default allowlist file, grouped with section comments.
pub fn default_file_content() -> String {
    let mut out = String::from(
        "# oplogger - highlighted security tools\n\
         # One tool name per line. Lines starting with # are ignored.\n\
         # Add your own tools below or remove ones you don't use.\n",
    );
    for (section, names) in DEFAULT_TOOLS {
        out.push_str("\n# ");
        out.push_str(section);
        out.push('\n');
        for name in *names {
            out.push_str(name);
            out.push('\n');
        }
    }
    out
}

fn write_default(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, default_file_content())
        .with_context(|| format!("Failed to write {}", path.display()))
}
