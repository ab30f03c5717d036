mod helpers;

mod facade_tests;
