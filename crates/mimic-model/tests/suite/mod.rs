mod json_format;
