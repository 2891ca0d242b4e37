mod directives;
mod sample;
