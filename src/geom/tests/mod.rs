mod test_bevel_basic;
