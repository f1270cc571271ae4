/// Description of the standard library as a whole
pub const STD_DESCRIPTION: &str = "The standard library: audited, dependency-free modules \
    maintained alongside the runtime.";

/// Descriptions of the standard library's top-level modules
const STD_MODULES: &[(&str, &str)] = &[
    ("archive", "Helpers for working with archive formats such as tar."),
    ("async", "Utilities for asynchronous code: deadlines, debouncing, pooling and retries."),
    ("bytes", "Helpers for manipulating `Uint8Array` byte slices."),
    ("collections", "Pure functions for common tasks on arrays and objects."),
    ("crypto", "Extensions to the Web Crypto API, including more digest algorithms."),
    ("csv", "Reading and writing comma-separated values."),
    ("datetime", "Parsing and formatting of dates and times."),
    ("dotenv", "Loading environment variables from `.env` files."),
    ("encoding", "Encoders and decoders for hex, base32, base58, base64, varint and more."),
    ("flags", "Command line argument parsing."),
    ("fmt", "Formatting of colors, byte sizes, durations and printf-style strings."),
    ("front_matter", "Extraction of front matter from strings."),
    ("fs", "File system helpers: copying, walking, globbing and ensuring paths exist."),
    ("hash", "Non-cryptographic hash functions."),
    ("html", "Escaping and unescaping of HTML entities."),
    ("http", "HTTP server, cookie, status and content negotiation utilities."),
    ("io", "Reader and writer utilities for buffered and streamed I/O."),
    ("json", "Streaming JSON parsing and serialization."),
    ("jsonc", "Parsing of JSON with comments."),
    ("log", "Configurable logging with handlers and formatters."),
    ("media_types", "Lookup of media types and file extensions."),
    ("node", "Compatibility layer for Node.js built-in modules."),
    ("path", "Cross-platform file path manipulation."),
    ("permissions", "Helpers for querying and requesting runtime permissions."),
    ("regexp", "Helpers for working with regular expressions."),
    ("semver", "Parsing and comparison of semantic versions."),
    ("signal", "Helpers for handling OS signals."),
    ("streams", "Utilities for Web Streams."),
    ("testing", "Assertions, mocking, snapshot testing and BDD-style test helpers."),
    ("toml", "Parsing and serialization of TOML."),
    ("uuid", "Generation and validation of UUIDs."),
    ("wasi", "WebAssembly System Interface implementation."),
    ("yaml", "Parsing and serialization of YAML."),
];

/// Description of the std module named by the first segment of `path`.
pub fn std_module_description(path: &str) -> Option<&'static str> {
    let first = path.trim_start_matches('/').split('/').next()?;
    // Single-file modules are addressed as `fmt.ts` style entries in older releases
    let first = first.split('.').next().unwrap_or(first);
    STD_MODULES
        .iter()
        .find(|(name, _)| *name == first)
        .map(|(_, description)| *description)
}
